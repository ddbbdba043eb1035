use crate::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};

const IMAGE: &str = "mysql";
const TAG: &str = "8.4";
const PORT: u16 = 3306;
const DATABASE: &str = "snip";
const USER: &str = "snip";
const PASSWORD: &str = "snip";

/// A throwaway MySQL server holding an empty `snip` database.
///
/// The container is removed when the value is dropped.
pub struct MySqlServer {
    container: ContainerAsync<GenericImage>,
}

impl MySqlServer {
    pub async fn start() -> Result<Self> {
        let container = GenericImage::new(IMAGE, TAG)
            .with_exposed_port(PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr("ready for connections"))
            .with_env_var("MYSQL_DATABASE", DATABASE)
            .with_env_var("MYSQL_USER", USER)
            .with_env_var("MYSQL_PASSWORD", PASSWORD)
            .with_env_var("MYSQL_ROOT_PASSWORD", PASSWORD)
            .start()
            .await?;

        Ok(Self { container })
    }

    /// `mysql://` DSN of the `snip` database, reachable from the host.
    pub async fn database_url(&self) -> Result<String> {
        let host = self.container.get_host().await?;
        let port = self.container.get_host_port_ipv4(PORT).await?;
        Ok(format!("mysql://{USER}:{PASSWORD}@{host}:{port}/{DATABASE}"))
    }
}
