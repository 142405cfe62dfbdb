//! CLI for Pixelforge - multi-vendor image generation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use pixelforge::config::Config;
use pixelforge::gallery::GalleryStore;
use pixelforge::{GenerationRequest, ModelId, ProviderRegistry, VendorKind};
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pixelforge")]
#[command(about = "Generate images via AI APIs (DALL-E, Stable Diffusion, Gemini)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),

    /// Generate images from a text prompt
    Generate(GenerateArgs),

    /// Inspect or clear the local gallery
    Gallery {
        #[command(subcommand)]
        command: GalleryCommands,
    },

    /// List vendors and whether their API key is configured
    Providers,
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind (overrides PIXELFORGE_ADDR)
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt describing the image
    prompt: String,

    /// Model to generate with
    #[arg(short, long, value_enum, default_value = "dall-e-3")]
    model: ModelArg,

    /// Things the image should avoid
    #[arg(long)]
    negative: Option<String>,

    /// Number of images to generate
    #[arg(short, long, default_value_t = 1)]
    num_images: u32,

    /// Append the results to the local gallery
    #[arg(long)]
    save_gallery: bool,
}

#[derive(Subcommand)]
enum GalleryCommands {
    /// List stored gallery records
    List,
    /// Remove all stored gallery records
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    #[value(name = "dall-e-3")]
    DallE3,
    #[value(name = "dall-e-2")]
    DallE2,
    #[value(name = "stable-diffusion")]
    StableDiffusion,
    #[value(name = "gemini")]
    Gemini,
}

impl From<ModelArg> for ModelId {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::DallE3 => ModelId::DallE3,
            ModelArg::DallE2 => ModelId::DallE2,
            ModelArg::StableDiffusion => ModelId::StableDiffusion,
            ModelArg::Gemini => ModelId::Gemini,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelforge=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Serve(args) => {
            let registry = Arc::new(ProviderRegistry::from_config(&config));
            let addr = args.addr.unwrap_or(config.addr);
            pixelforge::server::serve(addr, registry).await?;
        }
        Commands::Generate(args) => {
            generate(args, &config, cli.json).await?;
        }
        Commands::Gallery { command } => {
            gallery(command, &config, cli.json)?;
        }
        Commands::Providers => {
            list_providers(&config, cli.json)?;
        }
    }

    Ok(())
}

async fn generate(args: GenerateArgs, config: &Config, json_output: bool) -> anyhow::Result<()> {
    let registry = ProviderRegistry::from_config(config);

    let mut request = GenerationRequest::new(&args.prompt, args.model.into())
        .with_num_images(args.num_images);
    if let Some(negative) = args.negative {
        request = request.with_negative_prompt(negative);
    }

    let images = registry.generate(&request).await?;

    if args.save_gallery {
        let store = GalleryStore::new(&config.gallery_path);
        store.append_generated(&images, &args.prompt)?;
    }

    if json_output {
        let result = serde_json::json!({
            "model": request.model.to_string(),
            "images": images,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Generated {} image(s) via {}", images.len(), request.model);
        for image in &images {
            if image.url.starts_with("data:") {
                println!("  data URI ({} bytes)", image.url.len());
            } else {
                println!("  {}", image.url);
            }
        }
    }

    Ok(())
}

fn gallery(command: GalleryCommands, config: &Config, json_output: bool) -> anyhow::Result<()> {
    let store = GalleryStore::new(&config.gallery_path);

    match command {
        GalleryCommands::List => {
            let records = store.list()?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("Gallery is empty");
            } else {
                for record in &records {
                    println!("{}  {}  {}", record.id, record.created_at, record.prompt);
                }
            }
        }
        GalleryCommands::Clear => {
            store.clear()?;
            if !json_output {
                println!("Gallery cleared");
            }
        }
    }

    Ok(())
}

fn list_providers(config: &Config, json_output: bool) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct VendorInfo {
        name: &'static str,
        kind: VendorKind,
        models: &'static [&'static str],
        env_var: &'static str,
        configured: bool,
    }

    let registry = ProviderRegistry::from_config(config);
    let vendors: Vec<VendorInfo> = [
        (VendorKind::OpenAi, &["dall-e-3", "dall-e-2"][..], "OPENAI_API_KEY"),
        (VendorKind::Stability, &["stable-diffusion"][..], "STABILITY_API_KEY"),
        (VendorKind::Gemini, &["gemini"][..], "GOOGLE_API_KEY"),
    ]
    .into_iter()
    .map(|(kind, models, env_var)| VendorInfo {
        name: kind.display_name(),
        kind,
        models,
        env_var,
        configured: registry.is_configured(kind),
    })
    .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&vendors)?);
    } else {
        println!("Available vendors:\n");
        for vendor in &vendors {
            let status = if vendor.configured { "✓" } else { "✗" };
            println!("  {} {} ({})", status, vendor.name, vendor.kind);
            println!("    models: {}", vendor.models.join(", "));
            println!("    API key: {}", vendor.env_var);
        }
    }

    Ok(())
}
