use clap::Parser;
use ditto_imagine::client::{DEFAULT_RELAY_URL, GeneratorView, RelayClient};
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader};

const PLACEHOLDER: &str = "Your masterpiece will appear here";

#[derive(Parser, Debug)]
#[command(name = "ditto-imagine")]
#[command(about = "Turn a text prompt into an image through a ditto-imagine relay")]
#[command(version)]
struct Cli {
    /// Base URL of the relay
    #[arg(long, default_value = DEFAULT_RELAY_URL)]
    relay: String,

    /// Prompt describing the image; omit to start an interactive session
    prompt: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    ditto_imagine::observability::init_tracing("warn", false)?;

    let client = RelayClient::new(&cli.relay);
    let mut view = GeneratorView::new();

    if let Some(prompt) = cli.prompt {
        view.set_prompt(prompt);
        if !submit(&mut view, &client).await {
            std::process::exit(1);
        }
        return Ok(());
    }

    println!("{PLACEHOLDER}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"describe your image> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        view.set_prompt(line);
        submit(&mut view, &client).await;
    }
    Ok(())
}

async fn submit(view: &mut GeneratorView, client: &RelayClient) -> bool {
    let request = match view.begin_submit() {
        Ok(request) => request,
        Err(notification) => {
            eprintln!("{notification}");
            return false;
        }
    };

    println!("Creating magic...");
    let outcome = client.generate(&request).await;
    if let Some(notification) = view.finish_submit(outcome) {
        eprintln!("{notification}");
        if let Some(url) = view.image_url() {
            println!("Your Creation: {url}");
        }
        return false;
    }

    match view.image_url() {
        Some(url) => println!("Your Creation: {url}"),
        None => println!("{PLACEHOLDER}"),
    }
    true
}
