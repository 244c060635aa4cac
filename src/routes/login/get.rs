use actix_web::{get, http::header::ContentType, HttpResponse, Responder};
use actix_web_flash_messages::IncomingFlashMessages;
use std::fmt::Write;

#[get("/login")]
pub async fn login_form(flash_messages: IncomingFlashMessages) -> impl Responder {
    let mut msg_html = String::new();
    for m in flash_messages.iter() {
        writeln!(
            msg_html,
            "<p><i>{}</i></p>",
            htmlescape::encode_minimal(m.content())
        )
        .unwrap();
    }

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(format!(
            r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Login</title>
</head>
<body>
    {msg_html}
    <form action="/login" method="post">
        <label>Username
                <input type="text" name="username" placeholder="Enter Username">
        </label>

        <label>Password
                <input type="password" name="password" placeholder="Enter Password">
        </label>

        <button type="submit">Login</button>
    </form>
    <p><a href="/oauth/login">Log in with your identity provider</a></p>
</body>
</html>
        "#
        ))
}
