mod admin_dashboard;
mod login;
mod oauth;
mod signup_confirm;
