//! Client session - sends commands and decodes the responses

use tracing::{debug, info};
use valnote_core::Value;
use valnote_protocol::decode;

use crate::config::ClientConfig;
use crate::connection::Connection;
use crate::error::ClientResult;

/// A connected, optionally authenticated session with one server.
///
/// Strictly request/response: every command waits for its response line
/// before the next one is sent.
pub struct Client {
    connection: Connection,
}

impl Client {
    /// Connect, then authenticate if the config carries a password
    pub async fn connect(config: &ClientConfig) -> ClientResult<Self> {
        let connection = Connection::connect(&config.host, config.port, config.timeout()).await?;
        let mut client = Self::from_connection(connection);

        if let Some(ref password) = config.password {
            client.authenticate(password).await?;
        }

        Ok(client)
    }

    /// Wrap an already established connection
    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    /// Send the authentication command.
    ///
    /// A wrong password comes back as `DecodeError::AuthenticationError`.
    pub async fn authenticate(&mut self, password: &str) -> ClientResult<()> {
        self.request(&authenticate_command(password)).await?;
        info!(peer = %self.connection.peer_addr(), "Authenticated");
        Ok(())
    }

    /// Execute a command and return its decoded result
    pub async fn execute(&mut self, command: &str) -> ClientResult<Value> {
        debug!(command, "Executing command");
        self.request(command).await
    }

    async fn request(&mut self, command: &str) -> ClientResult<Value> {
        self.connection.send(&format!("{}\n", command)).await?;
        let response = self.connection.recv().await?;
        Ok(decode(&response)?)
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

fn authenticate_command(password: &str) -> String {
    format!("Connection authenticate: \"{}\";", password.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;
    use valnote_protocol::DecodeError;

    use crate::error::{ClientError, TransportError};

    /// Serve one connection: answer each received line with the next reply,
    /// then hang up. Resolves to the lines received.
    async fn fake_server(replies: Vec<&'static str>) -> (SocketAddr, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read, mut write) = stream.into_split();
            let mut lines = BufReader::new(read).lines();
            let mut received = Vec::new();

            for reply in replies {
                let Some(line) = lines.next_line().await.unwrap() else {
                    break;
                };
                received.push(line);
                write.write_all(reply.as_bytes()).await.unwrap();
            }
            received
        });

        (addr, handle)
    }

    #[tokio::test]
    async fn test_execute_decodes_response() {
        let (addr, server) = fake_server(vec!["null\n", "[f,i,std::ages]\n"]).await;

        let config = ClientConfig::new("127.0.0.1", addr.port());
        let mut client = Client::connect(&config).await.unwrap();
        assert_eq!(client.connection().peer_addr(), addr);

        let created = client.execute("Integer create: i withValue: 42;").await.unwrap();
        assert_eq!(created, Value::Null);

        let listed = client.execute("Context listVariables;").await.unwrap();
        assert_eq!(
            listed,
            Value::Vector(vec![
                Value::Symbol("f".into()),
                Value::Symbol("i".into()),
                Value::Symbol("std::ages".into()),
            ])
        );
        drop(client);

        assert_eq!(
            server.await.unwrap(),
            vec!["Integer create: i withValue: 42;", "Context listVariables;"]
        );
    }

    #[tokio::test]
    async fn test_connect_authenticates_with_password() {
        let (addr, server) = fake_server(vec!["null\n", "42\n"]).await;

        let config = ClientConfig::new("127.0.0.1", addr.port()).with_password("secure\"password");
        let mut client = Client::connect(&config).await.unwrap();
        assert_eq!(client.execute("i get;").await.unwrap(), Value::Integer(42));
        drop(client);

        let received = server.await.unwrap();
        assert_eq!(received[0], r#"Connection authenticate: "secure\"password";"#);
        assert_eq!(received[1], "i get;");
    }

    #[tokio::test]
    async fn test_wrong_password_fails_connect() {
        let (addr, _server) = fake_server(vec!["AuthenticationError: wrong password.\n"]).await;

        let config = ClientConfig::new("127.0.0.1", addr.port()).with_password("wrongpassword");
        let err = Client::connect(&config).await.err().unwrap();

        assert!(matches!(
            err,
            ClientError::Decode(DecodeError::AuthenticationError(ref m)) if m == "AuthenticationError: wrong password."
        ));
        assert!(!err.is_connection_lost());
    }

    #[tokio::test]
    async fn test_server_errors_are_returned() {
        let (addr, _server) = fake_server(vec![
            "RuntimeError: name cannot be resolved to a variable.\n",
            "'9'\n",
        ])
        .await;

        let mut client = Client::connect(&ClientConfig::new("127.0.0.1", addr.port())).await.unwrap();

        let err = client.execute("missing get;").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(DecodeError::RuntimeError(_))));

        // The session stays usable after a server-reported error.
        assert_eq!(client.execute("numeric get;").await.unwrap(), Value::Char('9'));
    }

    #[tokio::test]
    async fn test_closed_connection_is_reported() {
        let (addr, server) = fake_server(vec![]).await;

        let mut client = Client::connect(&ClientConfig::new("127.0.0.1", addr.port())).await.unwrap();
        server.await.unwrap();

        let err = client.execute("i get;").await.unwrap_err();
        assert!(err.is_connection_lost());
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::ConnectionClosed | TransportError::Io(_))
        ));
    }

    #[test]
    fn test_authenticate_command() {
        assert_eq!(
            authenticate_command("securepassword"),
            r#"Connection authenticate: "securepassword";"#
        );
    }
}
