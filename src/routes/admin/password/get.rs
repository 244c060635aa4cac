use actix_web::{get, http::header::ContentType, HttpResponse, Responder};
use actix_web_flash_messages::IncomingFlashMessages;
use std::fmt::Write;

#[get("/password")]
pub async fn change_password_form(
    flash_messages: IncomingFlashMessages,
) -> actix_web::Result<impl Responder> {
    let mut msg_html = String::new();
    for m in flash_messages.iter() {
        writeln!(
            msg_html,
            "<p><i>{}</i></p>",
            htmlescape::encode_minimal(m.content())
        )
        .unwrap();
    }

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(format!(
            r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Change Password</title>
</head>
<body>
    {msg_html}
    <form action="/admin/password" method="post">
        <label>Current password
            <input type="password" name="current_password" placeholder="Enter current password">
        </label>
        <br>
        <label>New password
            <input type="password" name="new_password" placeholder="Enter new password">
        </label>
        <br>
        <label>Confirm new password
            <input type="password" name="new_password_check" placeholder="Type the new password again">
        </label>
        <br>
        <button type="submit">Change password</button>
    </form>
    <p><a href="/admin/dashboard">&lt;- Back</a></p>
</body>
</html>
"#
        )))
}
