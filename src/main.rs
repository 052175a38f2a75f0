use bite_advisor::{AdvisorConfig, PipelineResult, RawImage, RecipePipeline};
use log::debug;
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage: bite-advisor <image> [--json] [--mime <type>]";

struct Args {
    image: String,
    json: bool,
    mime: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut image = None;
    let mut json = false;
    let mut mime = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--mime" => {
                mime = Some(args.next().ok_or("--mime needs a value")?);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            other if other.starts_with("--") => {
                return Err(format!("Unknown flag {}\n{}", other, USAGE));
            }
            other => image = Some(other.to_string()),
        }
    }

    let image = image.ok_or_else(|| format!("Please provide an image path\n{}", USAGE))?;
    Ok(Args { image, json, mime })
}

fn print_result(result: &PipelineResult) {
    println!("Ingredients: {}", result.ingredients.join(", "));
    println!();

    if result.recipes.is_empty() {
        println!("No recipes found.");
        return;
    }
    for recipe in &result.recipes {
        println!("{}", recipe.to_text());
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    let config = match AdvisorConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!("Loaded configuration: model {}", config.vision.model);

    let pipeline = match RecipePipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut image = RawImage::from_path(&args.image);
    if let Some(mime) = args.mime {
        image = image.with_mime_type(mime);
    }

    match pipeline.process(&image).await {
        Ok(result) if args.json => match serde_json::to_string_pretty(&result) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to serialize result: {}", e);
                ExitCode::FAILURE
            }
        },
        Ok(result) => {
            print_result(&result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
