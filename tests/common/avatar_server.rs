use actix_web::{web, App, HttpResponse, HttpServer};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::net::TcpListener;
use std::time::Duration;

pub const SLOW_AVATAR_DELAY: Duration = Duration::from_millis(1000);
/// Wider than the decoder accepts, yet only a few hundred bytes on the wire.
pub const OVERSIZED_AVATAR_WIDTH: u32 = 5000;

pub fn png_bytes(size: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(size, size, Rgba(color));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode test png");
    bytes
}

async fn red_png() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("image/png")
        .body(png_bytes(64, [220, 30, 30, 255]))
}

async fn slow_png() -> HttpResponse {
    tokio::time::sleep(SLOW_AVATAR_DELAY).await;
    red_png().await
}

async fn hang() -> HttpResponse {
    tokio::time::sleep(Duration::from_secs(120)).await;
    red_png().await
}

async fn wide_png() -> HttpResponse {
    let image = RgbaImage::from_pixel(OVERSIZED_AVATAR_WIDTH, 1, Rgba([30, 200, 30, 255]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode test png");
    HttpResponse::Ok().content_type("image/png").body(bytes)
}

async fn html_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body("<html><body>not an image</body></html>")
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().finish()
}

/// Serves fixed avatar responses on a random local port; returns its base URL.
pub fn spawn_avatar_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server = HttpServer::new(|| {
        App::new()
            .route("/avatar.png", web::get().to(red_png))
            .route("/profile.html", web::get().to(html_page))
            .route("/missing.png", web::get().to(not_found))
            .route("/slow.png", web::get().to(slow_png))
            .route("/hang", web::get().to(hang))
            .route("/wide.png", web::get().to(wide_png))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}
