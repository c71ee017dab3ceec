mod app;
mod bench;
mod config;
mod document;
mod driver;
mod elasticsearch;
mod environment;
mod helpers;
mod local_logger;
mod prelude;
mod request_client;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let res = crate::app::run().await;
    if let Err(err) = res {
        log::logger().flush();
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
