use crate::domain::UserEmail;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

pub struct EmailClient {
    client: Client,
    url: Url,
    sender: UserEmail,
    auth_token: SecretString,
}

impl EmailClient {
    pub fn new(url: Url, sender: UserEmail, auth_token: SecretString) -> Self {
        Self {
            client: Client::new(),
            url,
            sender,
            auth_token,
        }
    }

    pub async fn send_email(
        &self,
        recipient: &UserEmail,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<(), reqwest::Error> {
        let body = SendEmailRequest {
            from: self.sender.as_ref(),
            to: recipient.as_ref(),
            subject,
            text_body,
            html_body,
        };

        let url = self
            .url
            .join("email")
            .expect("Given URL cannot fail parsing.");

        self.client
            .post(url)
            .header("X-Postmark-Server-Token", self.auth_token.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    html_body: &'a str,
}
