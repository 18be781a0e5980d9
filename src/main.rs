use clap::Parser;
use log::debug;
use nutrition_analyst::config;
use nutrition_analyst::{
    render, AnalysisRequest, AnalysisSession, DietaryFlags, NutritionAnalyzer, RenderedAnalysis,
    Typewriter,
};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::time::Duration;

/// Pause between nutrient bars appearing
const BAR_STAGGER: Duration = Duration::from_millis(100);

/// Invent a dish from your ingredients and estimate its nutrients
#[derive(Parser, Debug)]
#[command(name = "nutrition-analyst", version, about)]
struct Cli {
    /// Ingredients, e.g. "avocado, whole wheat bread, salt, pepper"
    #[arg(required = true)]
    ingredients: Vec<String>,

    /// Only suggest vegetarian dishes
    #[arg(long)]
    vegetarian: bool,

    /// Only suggest vegan dishes (implies --vegetarian)
    #[arg(long)]
    vegan: bool,

    /// Prefer dishes high in protein
    #[arg(long)]
    high_protein: bool,

    /// Milliseconds per revealed character of the dish name
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Print the result as JSON instead of the animated view
    #[arg(long)]
    json: bool,
}

/// "Analyzing..." line on stderr, erased when dropped
struct LoadingIndicator {
    interactive: bool,
}

impl LoadingIndicator {
    fn show() -> Self {
        let interactive = io::stderr().is_terminal();
        if interactive {
            eprint!("Our AI is analyzing...");
        }
        LoadingIndicator { interactive }
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        if self.interactive {
            eprint!("\r\x1b[2K");
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match config::init() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("CRITICAL: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let analyzer = match NutritionAnalyzer::from_config(config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("CRITICAL: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let flags = DietaryFlags {
        vegetarian: cli.vegetarian,
        vegan: cli.vegan,
        high_protein: cli.high_protein,
    }
    .normalized();
    let request = AnalysisRequest::new(cli.ingredients.join(" "), flags);
    debug!("Request: {:?}", request);

    let mut session = AnalysisSession::new(analyzer);
    let outcome = {
        let _loading = LoadingIndicator::show();
        session.submit(&request).await
    };

    let result = match outcome {
        Ok(result) => result,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let rendered = match render(result) {
        Ok(rendered) => rendered,
        Err(notice) => {
            eprintln!("{}", notice);
            return ExitCode::FAILURE;
        }
    };

    let interval = cli
        .interval_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.typewriter_interval());

    let printed = if cli.json {
        print_json(&rendered)
    } else {
        print_animated(&rendered, interval).await
    };

    match printed {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to write output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json(rendered: &RenderedAnalysis) -> io::Result<()> {
    let json = serde_json::to_string_pretty(rendered)?;
    println!("{}", json);
    Ok(())
}

async fn print_animated(rendered: &RenderedAnalysis, interval: Duration) -> io::Result<()> {
    type_out(&rendered.dish_name, interval).await?;

    let mut stdout = io::stdout();
    if let Some(description) = &rendered.description {
        writeln!(stdout, "{}", description)?;
    }

    writeln!(stdout)?;
    writeln!(stdout, "Estimated Nutritional Values")?;
    for bar in &rendered.bars {
        tokio::time::sleep(BAR_STAGGER).await;
        writeln!(stdout, "{}", rendered.bar_line(bar))?;
        stdout.flush()?;
    }

    if !rendered.recipe_steps.is_empty() {
        writeln!(stdout)?;
        writeln!(stdout, "How to Make It")?;
        for (index, step) in rendered.recipe_steps.iter().enumerate() {
            writeln!(stdout, "  {}. {}", index + 1, step)?;
        }
    }
    Ok(())
}

/// Print `title` as the typewriter reveals it
async fn type_out(title: &str, interval: Duration) -> io::Result<()> {
    let mut typewriter = Typewriter::new(interval);
    let mut revealed = typewriter.subscribe();
    typewriter.set_text(title);

    let total = title.chars().count();
    let mut printed = 0;
    let mut stdout = io::stdout();
    while printed < total {
        if revealed.changed().await.is_err() {
            break;
        }
        let prefix = revealed.borrow_and_update().clone();
        for ch in prefix.chars().skip(printed) {
            write!(stdout, "{}", ch)?;
            printed += 1;
        }
        stdout.flush()?;
    }
    writeln!(stdout)
}
