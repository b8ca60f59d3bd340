//! HTML bodies for outgoing mail.

pub const VERIFICATION_SUBJECT: &str = "Verify your Campus email address";
pub const PASSWORD_RESET_SUBJECT: &str = "Reset your Campus password";

pub fn render_email_verification(name: &str, link: &str) -> String {
    format!(
        "<html><body>\
         <p>Hi {name},</p>\
         <p>Welcome to Campus. Please confirm your email address to activate \
         your account:</p>\
         <p><a href=\"{link}\">Verify my email</a></p>\
         <p>This link expires in one hour. If you did not create a Campus \
         account, you can ignore this mail.</p>\
         </body></html>"
    )
}

pub fn render_password_reset(link: &str) -> String {
    format!(
        "<html><body>\
         <p>Hello,</p>\
         <p>We received a request to reset your Campus password:</p>\
         <p><a href=\"{link}\">Reset my password</a></p>\
         <p>If you did not request a reset, you can ignore this mail and your \
         password will stay unchanged.</p>\
         </body></html>"
    )
}

pub fn verification_link(base_url: &str, token: &str) -> String {
    format!("{}/auth/verify/confirm?token={token}", base_url.trim_end_matches('/'))
}

pub fn password_reset_link(base_url: &str, token: &str) -> String {
    format!("{}/auth/password/reset?token={token}", base_url.trim_end_matches('/'))
}
