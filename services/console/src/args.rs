use clap::{Parser, ValueEnum};

/// Server layout preset used when no config file is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Layout {
    /// All defenses available, overload above 90%
    #[default]
    MultiDefense,
    /// Overload above 80%, stronger flood draw
    SingleServer,
}

/// Terminal driver for the DoS load simulation
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "dos-console")]
#[command(about = "Tick the DoS load simulation and render it in the terminal", long_about = None)]
#[command(version)]
pub struct CliArgs {
    /// JSON engine config (missing fields use defaults)
    #[arg(short, long = "config", env = "DOS_SIM_CONFIG")]
    pub config_path: Option<String>,

    /// Layout preset, ignored when a config file is given
    #[arg(short, long, value_enum, default_value_t = Layout::MultiDefense)]
    pub layout: Layout,

    /// RNG seed for reproducible runs
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Stop after this many ticks (default: run until Ctrl-C)
    #[arg(short, long)]
    pub ticks: Option<u64>,

    /// Operator plan: flood, slow, idle, or a path to a JSON plan
    #[arg(short, long, default_value = "flood")]
    pub plan: String,

    /// Run a scripted scenario and exit
    #[arg(long)]
    pub scenario: Option<String>,

    /// Log lines rendered per frame
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(usize))]
    pub log_lines: usize,

    /// Write a JSON export at exit
    #[arg(short, long = "export")]
    pub export_path: Option<String>,
}
