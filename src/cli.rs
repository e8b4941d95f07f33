use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML
    #[arg(long, default_value = "tonnetz.toml")]
    pub config: String,

    /// MIDI input port name substring (overrides config)
    #[arg(long)]
    pub port: Option<String>,

    /// List MIDI input ports and exit
    #[arg(long, default_value_t = false)]
    pub list_ports: bool,

    /// Per-channel pitch-bend range in semitones (overrides config)
    #[arg(long)]
    pub bend_range: Option<f64>,
}
