use nurquran::{app::App, util::log::initialize_logging};

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> color_eyre::Result<()> {
    setup()?;

    let surah_no = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<u16>())
        .transpose()?;

    let mut app = App::new()?;
    app.run(surah_no).await
}

fn setup() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    initialize_logging()
}
