use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::MailConfig;

/// Outbound notifications to the site owner.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn notify(&self, subject: &str, body: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &MailConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.relay)
            .with_context(|| format!("smtp relay {}", cfg.relay))?
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .build();
        let from = cfg
            .username
            .parse::<Mailbox>()
            .with_context(|| format!("parse EMAIL_USER {:?}", cfg.username))?;
        let to = cfg
            .notify_to
            .parse::<Mailbox>()
            .with_context(|| format!("parse CONTACT_NOTIFY_TO {:?}", cfg.notify_to))?;
        Ok(Self {
            transport,
            from,
            to,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn notify(&self, subject: &str, body: &str) -> anyhow::Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("build notification mail")?;
        self.transport
            .send(email)
            .await
            .context("smtp send")?;
        Ok(())
    }
}
