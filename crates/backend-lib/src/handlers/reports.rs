use axum::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};
use crate::report::{single_line_pdf, REPORT_TITLE};

/// `GET /api/pdfs`
pub async fn download() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "application/pdf"),
            (CONTENT_DISPOSITION, "inline; filename=\"report.pdf\""),
        ],
        single_line_pdf(REPORT_TITLE),
    )
}
