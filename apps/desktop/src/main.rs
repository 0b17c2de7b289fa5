use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use shared::domain::{Mode, Track};
use timetable_core::{
    bootstrap, load_settings, source_for, Controller, DataLocation, Direction, Dropdown, Grid,
    LatestFrame, MemoryHistory, Presenter, RenderScope, Startup, ViewModel,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod text;

#[derive(Parser, Debug)]
#[command(about = "Print the class timetable and page through it from the terminal")]
struct Args {
    /// Directory or http(s) base URL holding schedule.json and info.json.
    #[arg(long)]
    data: Option<String>,
    /// Query the page is opened with, e.g. "?type=week&grade=M1&day=2024-04-08".
    #[arg(long, default_value = "")]
    query: String,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Keep reading actions from stdin after the first frame.
    #[arg(long)]
    interactive: bool,
}

/// Prints every render pass to stdout and keeps the merged frame for lookups.
#[derive(Default)]
struct TerminalView {
    frame: LatestFrame,
}

impl Presenter for TerminalView {
    fn present(&mut self, model: &ViewModel, scope: RenderScope) {
        self.frame.present(model, scope);
        let mut stdout = io::stdout().lock();
        if let Err(err) = text::write_frame(&mut stdout, model, scope) {
            tracing::warn!("failed to write frame: {err}");
        }
    }
}

type TerminalController = Controller<TerminalView, MemoryHistory>;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Navigate(Direction),
    SwitchMode(Mode),
    Grade(String),
    Target(Track),
    Open(Dropdown),
    Close,
    Follow(usize),
    Url,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_lowercase();
    let arg = words.next();

    let command = match (verb.as_str(), arg) {
        ("prev" | "p", None) => Command::Navigate(Direction::Previous),
        ("next" | "n", None) => Command::Navigate(Direction::Next),
        ("day", None) => Command::SwitchMode(Mode::Day),
        ("week", None) => Command::SwitchMode(Mode::Week),
        ("grade", Some(label)) => Command::Grade(label.to_string()),
        ("target", Some(raw)) => Command::Target(
            Track::from_param(raw).ok_or_else(|| format!("unknown target '{raw}'"))?,
        ),
        ("open", Some("target")) => Command::Open(Dropdown::Track),
        ("open", Some("grade")) => Command::Open(Dropdown::Cohort),
        ("close", None) => Command::Close,
        ("follow", Some(raw)) => Command::Follow(
            raw.parse::<usize>()
                .ok()
                .filter(|column| *column > 0)
                .ok_or_else(|| format!("column must be a positive number, got '{raw}'"))?,
        ),
        ("url", None) => Command::Url,
        ("help" | "?", None) => Command::Help,
        ("quit" | "q" | "exit", None) => Command::Quit,
        _ => return Err(format!("unrecognized command '{}'", line.trim())),
    };
    Ok(command)
}

const HELP: &str = concat!(
    "commands: prev | next | day | week | grade <label> | target <undergrad|graduate> ",
    "| open <target|grade> | close | follow <column> | url | quit",
);

fn apply(controller: &mut TerminalController, command: Command) {
    match command {
        Command::Navigate(direction) => controller.navigate(direction),
        Command::SwitchMode(mode) => controller.switch_mode(mode),
        Command::Grade(label) => controller.select_cohort(&label),
        Command::Target(track) => controller.select_track(track),
        Command::Open(dropdown) => {
            controller.toggle_dropdown(dropdown);
            print_open_dropdown(controller);
        }
        Command::Close => controller.click_outside(),
        Command::Follow(column) => {
            let link = controller
                .presenter()
                .frame
                .model()
                .and_then(|model| match &model.grid {
                    Grid::Table(table) => table.columns.get(column - 1),
                    Grid::Placeholder(_) => None,
                })
                .map(|header| header.link.clone());
            match link {
                Some(link) => controller.follow_link(&link),
                None => println!("no column {column} in the current view"),
            }
        }
        Command::Url => println!("{}", controller.location().address()),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

fn print_open_dropdown(controller: &TerminalController) {
    let Some(model) = controller.presenter().frame.model() else {
        return;
    };
    let lines = match controller.open_dropdown() {
        Some(Dropdown::Track) => text::selector_lines(&model.track_selector),
        Some(Dropdown::Cohort) => text::selector_lines(&model.cohort_selector),
        None => return,
    };
    for line in lines {
        println!("{line}");
    }
}

async fn run_interactive(controller: &mut TerminalController) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush().context("failed to flush prompt")?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => return Ok(()),
            Ok(command) => {
                let before = controller.location().len();
                apply(controller, command);
                if controller.location().len() != before {
                    println!("-> {}", controller.location().address());
                }
            }
            Err(message) => println!("{message}\n{HELP}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let raw_location = args.data.unwrap_or_else(|| settings.data_location.clone());
    let location: DataLocation = raw_location
        .parse()
        .with_context(|| format!("invalid data location '{raw_location}'"))?;
    let source = source_for(&location);
    let today = chrono::Local::now().date_naive();

    let state = match bootstrap(source.as_ref(), &args.query, today, settings.catalog()).await {
        Startup::Ready(state) => state,
        Startup::Failed { error, view } => {
            let mut stdout = io::stdout().lock();
            text::write_frame(&mut stdout, &view, RenderScope::Full)?;
            bail!("schedule data failed to load from {location}: {error}");
        }
    };

    let page = location.page_url()?;
    let mut controller = Controller::new(
        state,
        TerminalView::default(),
        MemoryHistory::new(page, &args.query),
    );
    controller.start();
    println!("-> {}", controller.location().address());

    if args.interactive {
        run_interactive(&mut controller).await?;
    }
    Ok(())
}
