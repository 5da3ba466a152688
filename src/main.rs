#[tokio::main]
async fn main() {
    if let Err(e) = warden::run().await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
