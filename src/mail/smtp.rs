//! SMTP over implicit TLS, backed by lettre's low level async connection.

use crate::core::config::SmtpConfig;
use crate::core::{MailConnector, MailError, MailSession};
use async_trait::async_trait;
use lettre::Address;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{AsyncSmtpConnection, TlsParameters};
use lettre::transport::smtp::commands::{Data, Mail, Rcpt};
use lettre::transport::smtp::extension::ClientId;
use std::time::Duration;
use tracing::debug;

const HELLO_NAME: &str = "localhost";
const AUTH_MECHANISMS: &[Mechanism] = &[Mechanism::Plain, Mechanism::Login];

pub struct SmtpConnector {
    config: SmtpConfig,
    timeout: Duration,
    implicit_tls: bool,
}

impl SmtpConnector {
    pub fn new(config: SmtpConfig, timeout: Duration) -> Self {
        Self {
            config,
            timeout,
            implicit_tls: true,
        }
    }

    #[cfg(test)]
    fn plaintext(config: SmtpConfig, timeout: Duration) -> Self {
        Self {
            config,
            timeout,
            implicit_tls: false,
        }
    }
}

#[async_trait]
impl MailConnector for SmtpConnector {
    async fn connect(&self) -> Result<Box<dyn MailSession>, MailError> {
        let host = &self.config.host;
        let tls = if self.implicit_tls {
            Some(TlsParameters::new(host.clone()).map_err(|e| MailError::Connect(e.into()))?)
        } else {
            None
        };

        debug!("Connecting to {}:{}", host, self.config.port);
        let mut connection = AsyncSmtpConnection::connect_tokio1(
            (host.as_str(), self.config.port),
            Some(self.timeout),
            &ClientId::Domain(HELLO_NAME.to_string()),
            tls,
            None,
        )
        .await
        .map_err(|e| MailError::Connect(e.into()))?;

        let credentials = Credentials::new(self.config.user.clone(), self.config.password.clone());
        connection
            .auth(AUTH_MECHANISMS, &credentials)
            .await
            .map_err(|e| MailError::Authenticate(e.into()))?;
        debug!("Authenticated as {}", self.config.user);

        Ok(Box::new(SmtpSession { connection }))
    }
}

struct SmtpSession {
    connection: AsyncSmtpConnection,
}

fn parse_address(address: &str) -> Result<Address, MailError> {
    address
        .parse::<Address>()
        .map_err(|e| MailError::InvalidAddress {
            address: address.to_string(),
            source: e.into(),
        })
}

#[async_trait]
impl MailSession for SmtpSession {
    async fn mail(&mut self, from: &str) -> Result<(), MailError> {
        let from = parse_address(from)?;
        self.connection
            .command(Mail::new(Some(from), vec![]))
            .await
            .map_err(|e| MailError::Mail(e.into()))?;
        Ok(())
    }

    async fn rcpt(&mut self, to: &str) -> Result<(), MailError> {
        let address = parse_address(to)?;
        self.connection
            .command(Rcpt::new(address, vec![]))
            .await
            .map_err(|e| MailError::Rcpt {
                recipient: to.to_string(),
                source: e.into(),
            })?;
        Ok(())
    }

    async fn data(&mut self, payload: &[u8]) -> Result<(), MailError> {
        self.connection
            .command(Data)
            .await
            .map_err(|e| MailError::Data(e.into()))?;
        self.connection
            .message(payload)
            .await
            .map_err(|e| MailError::Data(e.into()))?;
        Ok(())
    }

    async fn quit(&mut self) -> Result<(), MailError> {
        self.connection
            .quit()
            .await
            .map_err(|e| MailError::Quit(e.into()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    #[derive(Default)]
    struct RelayLog {
        commands: Vec<String>,
        body: Vec<String>,
    }

    /// Plaintext relay answering one client, rejecting the RCPT numbered
    /// `reject_rcpt` (1-based) with a 550.
    async fn scripted_relay(reject_rcpt: Option<usize>) -> (u16, Arc<Mutex<RelayLog>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let log = Arc::new(Mutex::new(RelayLog::default()));
        let relay_log = Arc::clone(&log);

        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (reader, mut writer) = socket.into_split();
            let mut lines = BufReader::new(reader).lines();
            writer.write_all(b"220 relay.test ESMTP\r\n").await.unwrap();

            let mut rcpts = 0;
            while let Ok(Some(line)) = lines.next_line().await {
                let verb = line.split_whitespace().next().unwrap_or("").to_string();
                relay_log.lock().unwrap().commands.push(line);

                let reply = match verb.as_str() {
                    "EHLO" => "250-relay.test\r\n250 AUTH PLAIN LOGIN\r\n",
                    "AUTH" => "235 2.7.0 Authentication successful\r\n",
                    "MAIL" => "250 2.1.0 Ok\r\n",
                    "RCPT" => {
                        rcpts += 1;
                        if reject_rcpt == Some(rcpts) {
                            "550 5.1.1 Mailbox unavailable\r\n"
                        } else {
                            "250 2.1.5 Ok\r\n"
                        }
                    }
                    "DATA" => {
                        writer
                            .write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n")
                            .await
                            .unwrap();
                        while let Ok(Some(body_line)) = lines.next_line().await {
                            if body_line == "." {
                                break;
                            }
                            relay_log.lock().unwrap().body.push(body_line);
                        }
                        "250 2.0.0 Queued\r\n"
                    }
                    "QUIT" => "221 2.0.0 Bye\r\n",
                    _ => "500 5.5.2 Unrecognized command\r\n",
                };
                writer.write_all(reply.as_bytes()).await.unwrap();
                if verb == "QUIT" {
                    break;
                }
            }
        });

        (port, log)
    }

    fn relay_connector(port: u16) -> SmtpConnector {
        SmtpConnector::plaintext(
            SmtpConfig {
                host: "127.0.0.1".to_string(),
                port,
                user: "user".to_string(),
                password: "secret".to_string(),
            },
            Duration::from_secs(2),
        )
    }

    fn verbs(log: &Mutex<RelayLog>) -> Vec<String> {
        log.lock()
            .unwrap()
            .commands
            .iter()
            .map(|c| c.split_whitespace().next().unwrap_or("").to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_session_runs_full_dialogue() {
        let (port, log) = scripted_relay(None).await;

        let mut session = relay_connector(port).connect().await.unwrap();
        session.mail("from@example.com").await.unwrap();
        session.rcpt("r1@example.com").await.unwrap();
        session.rcpt("r2@example.com").await.unwrap();
        session
            .data(b"Subject: rate\r\n\r\nrate: 1.00")
            .await
            .unwrap();
        session.quit().await.unwrap();

        assert_eq!(
            verbs(&log),
            vec!["EHLO", "AUTH", "MAIL", "RCPT", "RCPT", "DATA", "QUIT"]
        );
        let log = log.lock().unwrap();
        assert_eq!(log.commands[0], "EHLO localhost");
        assert!(log.commands[1].starts_with("AUTH PLAIN "));
        assert_eq!(log.commands[2], "MAIL FROM:<from@example.com>");
        assert_eq!(log.commands[3], "RCPT TO:<r1@example.com>");
        assert_eq!(log.commands[4], "RCPT TO:<r2@example.com>");
        assert_eq!(log.body, vec!["Subject: rate", "", "rate: 1.00"]);
    }

    #[tokio::test]
    async fn test_rejected_recipient_is_rcpt_error() {
        let (port, log) = scripted_relay(Some(2)).await;

        let mut session = relay_connector(port).connect().await.unwrap();
        session.mail("from@example.com").await.unwrap();
        session.rcpt("r1@example.com").await.unwrap();
        let err = session.rcpt("r2@example.com").await.unwrap_err();
        session.quit().await.unwrap();

        assert!(matches!(
            err,
            MailError::Rcpt { ref recipient, .. } if recipient == "r2@example.com"
        ));
        assert_eq!(
            verbs(&log),
            vec!["EHLO", "AUTH", "MAIL", "RCPT", "RCPT", "QUIT"]
        );
        assert!(log.lock().unwrap().body.is_empty());
    }

    #[test]
    fn test_parse_address() {
        assert!(parse_address("user@example.com").is_ok());
        assert!(matches!(
            parse_address("not an address"),
            Err(MailError::InvalidAddress { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let connector = SmtpConnector::new(
            SmtpConfig {
                host: "127.0.0.1".to_string(),
                port,
                user: "user".to_string(),
                password: "secret".to_string(),
            },
            Duration::from_secs(2),
        );

        let result = connector.connect().await;
        assert!(matches!(result, Err(MailError::Connect(_))));
    }

    #[tokio::test]
    async fn test_plaintext_relay_fails_tls_handshake() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let _ = socket.write_all(b"220 plaintext relay ready\r\n").await;
                let mut buf = [0u8; 512];
                let _ = socket.read(&mut buf).await;
            }
        });

        let connector = SmtpConnector::new(
            SmtpConfig {
                host: "localhost".to_string(),
                port,
                user: "user".to_string(),
                password: "secret".to_string(),
            },
            Duration::from_secs(2),
        );

        assert!(matches!(
            connector.connect().await,
            Err(MailError::Connect(_))
        ));
    }
}
