use super::schema::SKILLS;
use crate::skill::SkillRecord;
use crate::store::Store;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_postgres::Client;

/// Postgres-backed [`Store`]. The rating update procedure itself stays
/// synchronous; this type bridges that boundary by blocking on the async
/// `tokio-postgres` client via `Handle::block_on`. Callers must only reach
/// this from a dedicated blocking thread (e.g. inside
/// `tokio::task::spawn_blocking`), never from a thread the same runtime is
/// already driving as an async worker — see `bin/rate.rs`.
pub struct PostgresStore {
    client: Arc<Client>,
    handle: Handle,
}

impl PostgresStore {
    pub fn new(client: Arc<Client>, handle: Handle) -> Self {
        Self { client, handle }
    }
}

impl Store for PostgresStore {
    fn load(&self, key: &str) -> anyhow::Result<Option<SkillRecord>> {
        #[rustfmt::skip]
        const SQL: &str = const_format::concatcp!(
            "SELECT mu, sigma, gamma, floor, ceil ",
            "FROM   ", SKILLS, " ",
            "WHERE  key = $1"
        );
        let client = Arc::clone(&self.client);
        let key = key.to_string();
        self.handle.block_on(async move {
            let row = client.query_opt(SQL, &[&key]).await?;
            Ok(row.map(|row| SkillRecord {
                mu: row.get(0),
                sigma: row.get(1),
                gamma: row.get(2),
                floor: row.get(3),
                ceil: row.get(4),
            }))
        })
    }

    fn flush(&mut self, records: &[(String, SkillRecord)]) -> anyhow::Result<()> {
        #[rustfmt::skip]
        const SQL: &str = const_format::concatcp!(
            "INSERT INTO ", SKILLS, " (key, mu, sigma, gamma, floor, ceil) ",
            "VALUES                    ($1,  $2, $3,    $4,    $5,    $6) ",
            "ON CONFLICT (key) DO UPDATE SET ",
                "mu    = EXCLUDED.mu, ",
                "sigma = EXCLUDED.sigma, ",
                "gamma = EXCLUDED.gamma, ",
                "floor = EXCLUDED.floor, ",
                "ceil  = EXCLUDED.ceil"
        );
        let client = Arc::clone(&self.client);
        let records = records.to_vec();
        self.handle.block_on(async move {
            for (key, record) in &records {
                client
                    .execute(
                        SQL,
                        &[
                            key,
                            &record.mu,
                            &record.sigma,
                            &record.gamma,
                            &record.floor,
                            &record.ceil,
                        ],
                    )
                    .await?;
            }
            Ok(())
        })
    }
}
