use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::instrument;

use crate::config::email::EmailConfig;
use crate::utils::errors::AppError;

/// SMTP notification sender for account lifecycle events.
///
/// All sends are synchronous SMTP calls moved onto the blocking pool. Role
/// change notifications are dispatched fire-and-forget by the caller; a
/// delivery failure never rolls back the triggering operation.
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self))]
    pub async fn send_otp_email(
        &self,
        to_email: &str,
        to_name: &str,
        otp: &str,
    ) -> Result<(), AppError> {
        let html_body = self.layout(
            "Verify your email",
            &format!(
                "<p style=\"margin: 0 0 20px 0; color: #666666; font-size: 16px;\">Hi <strong>{}</strong>,</p>\
                 <p style=\"margin: 0 0 20px 0; color: #666666; font-size: 16px;\">\
                 Welcome to Campusboard! Use the code below to verify your email address:</p>\
                 <p style=\"margin: 0 0 20px 0; text-align: center; font-size: 32px; letter-spacing: 8px; color: #1F2937;\"><strong>{}</strong></p>\
                 <p style=\"margin: 0; color: #666666; font-size: 14px;\"><strong>This code expires in 10 minutes.</strong></p>",
                to_name, otp
            ),
        );
        let text_body = format!(
            "Hi {},\n\n\
             Welcome to Campusboard! Your verification code is: {}\n\n\
             This code expires in 10 minutes.\n\n\
             If you didn't create an account, please ignore this email.\n\n\
             Campusboard Team",
            to_name, otp
        );

        self.send_email(to_email, "Verify your Campusboard account", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self))]
    pub async fn send_welcome_email(&self, to_email: &str, to_name: &str) -> Result<(), AppError> {
        let html_body = self.layout(
            "Welcome to Campusboard",
            &format!(
                "<p style=\"margin: 0 0 20px 0; color: #666666; font-size: 16px;\">Hi <strong>{}</strong>,</p>\
                 <p style=\"margin: 0 0 20px 0; color: #666666; font-size: 16px;\">\
                 Your email has been verified and your account is ready. You can now log in, \
                 follow your faculty and level notice boards, and join channels for your cohort.</p>",
                to_name
            ),
        );
        let text_body = format!(
            "Hi {},\n\n\
             Your email has been verified and your account is ready.\n\n\
             Campusboard Team",
            to_name
        );

        self.send_email(to_email, "Welcome to Campusboard", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self))]
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        reset_code: &str,
    ) -> Result<(), AppError> {
        let html_body = self.layout(
            "Password Reset Request",
            &format!(
                "<p style=\"margin: 0 0 20px 0; color: #666666; font-size: 16px;\">Hi <strong>{}</strong>,</p>\
                 <p style=\"margin: 0 0 20px 0; color: #666666; font-size: 16px;\">\
                 We received a request to reset your password. Enter this code to continue:</p>\
                 <p style=\"margin: 0 0 20px 0; text-align: center; font-size: 32px; letter-spacing: 8px; color: #1F2937;\"><strong>{}</strong></p>\
                 <p style=\"margin: 0 0 20px 0; color: #666666; font-size: 14px;\"><strong>This code expires in 1 hour.</strong></p>\
                 <p style=\"margin: 0; color: #666666; font-size: 14px;\">\
                 If you didn't request a reset, you can safely ignore this email.</p>",
                to_name, reset_code
            ),
        );
        let text_body = format!(
            "Hi {},\n\n\
             We received a request to reset your password.\n\n\
             Your reset code is: {}\n\n\
             This code expires in 1 hour. If you didn't request this, ignore this email.\n\n\
             Campusboard Team",
            to_name, reset_code
        );

        self.send_email(to_email, "Password Reset Request", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self))]
    pub async fn send_password_changed_email(
        &self,
        to_email: &str,
        to_name: &str,
    ) -> Result<(), AppError> {
        let html_body = self.layout(
            "Password Changed",
            &format!(
                "<p style=\"margin: 0 0 20px 0; color: #666666; font-size: 16px;\">Hi <strong>{}</strong>,</p>\
                 <p style=\"margin: 0 0 20px 0; color: #666666; font-size: 16px;\">\
                 Your password has been changed successfully.</p>\
                 <p style=\"margin: 0; color: #92400E; font-size: 14px;\">\
                 <strong>Security notice:</strong> if you didn't make this change, contact support immediately.</p>",
                to_name
            ),
        );
        let text_body = format!(
            "Hi {},\n\n\
             Your password has been changed successfully.\n\n\
             If you didn't make this change, contact support immediately.\n\n\
             Campusboard Team",
            to_name
        );

        self.send_email(to_email, "Your password was changed", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self))]
    pub async fn send_role_change_email(
        &self,
        to_email: &str,
        to_name: &str,
        previous_role: &str,
        new_role: &str,
    ) -> Result<(), AppError> {
        let html_body = self.layout(
            "Your role has changed",
            &format!(
                "<p style=\"margin: 0 0 20px 0; color: #666666; font-size: 16px;\">Hi <strong>{}</strong>,</p>\
                 <p style=\"margin: 0 0 20px 0; color: #666666; font-size: 16px;\">\
                 Your Campusboard role has been updated from <strong>{}</strong> to <strong>{}</strong>.</p>\
                 <p style=\"margin: 0; color: #666666; font-size: 14px;\">\
                 If you believe this is a mistake, contact the site administrators.</p>",
                to_name, previous_role, new_role
            ),
        );
        let text_body = format!(
            "Hi {},\n\n\
             Your Campusboard role has been updated from {} to {}.\n\n\
             If you believe this is a mistake, contact the site administrators.\n\n\
             Campusboard Team",
            to_name, previous_role, new_role
        );

        self.send_email(to_email, "Your Campusboard role has changed", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::info!(to = %to_email, subject, "SMTP disabled, skipping email");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(from.parse().map_err(|e| {
                AppError::internal(anyhow::anyhow!("Invalid from email: {}", e))
            })?)
            .to(to_email.parse().map_err(|e| {
                AppError::internal(anyhow::anyhow!("Invalid to email: {}", e))
            })?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal(anyhow::anyhow!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to send email: {}", e)))?;

        Ok(())
    }

    fn layout(&self, title: &str, inner: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f4; padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 4px rgba(0,0,0,0.1);">
                    <tr>
                        <td style="background-color: #1D4ED8; padding: 30px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 28px;">Campusboard</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 40px 30px;">
                            <h2 style="margin: 0 0 20px 0; color: #333333; font-size: 24px;">{title}</h2>
                            {inner}
                        </td>
                    </tr>
                    <tr>
                        <td style="background-color: #f8f9fa; padding: 20px 30px; text-align: center; border-top: 1px solid #e9ecef;">
                            <p style="margin: 0; color: #999999; font-size: 12px;">
                                This is an automated email from Campusboard. Please do not reply.
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#
        )
    }
}
