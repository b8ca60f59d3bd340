use anyhow::Context as _;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::NotificationConfig;

/// Outgoing-mail seam; the consumer is tested against an in-memory impl.
pub trait Mailer: Send + Sync + Clone {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()>;
}

/// SMTP mailer over a pooled STARTTLS connection.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &NotificationConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .context("invalid SMTP host")?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_pass.clone(),
            ))
            .build();
        let from = config
            .email_from
            .parse::<Mailbox>()
            .context("invalid EMAIL_FROM address")?;
        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>().context("invalid recipient address")?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_owned())
            .context("build message")?;
        self.transport
            .send(message)
            .await
            .context("send over SMTP")?;
        Ok(())
    }
}
