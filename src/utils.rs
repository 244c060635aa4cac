use actix_web::{http::header, HttpResponse};
use std::fmt::{Debug, Display};

pub fn e400(e: impl Debug + Display + 'static) -> actix_web::Error {
    actix_web::error::ErrorBadRequest(e)
}

pub fn e500(e: impl Debug + Display + 'static) -> actix_web::Error {
    actix_web::error::ErrorInternalServerError(e)
}

pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Walk the source chain when Debug-formatting an error.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
