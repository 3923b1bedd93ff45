use gumdrop::Options;

#[derive(Options, Debug)]
pub struct AppOptions {
    #[options(help = "print this help message")]
    pub help: bool,
    #[options(command)]
    pub command: Option<Command>,
}

#[derive(Options, Debug)]
pub enum Command {
    #[options(help = "run a rom headlessly until interrupted")]
    Run(RunOptions),
    #[options(help = "print cartridge header info and exit")]
    Info(InfoOptions),
    #[options(help = "get, set, list, or reset configuration keys")]
    Config(ConfigOptions),
}

#[derive(Options, Debug)]
pub struct RunOptions {
    #[options(help = "print this help message")]
    pub help: bool,
    #[options(free, help = "path to the rom file")]
    pub rom: String,
    #[options(help = "path to the config file, overrides the default location")]
    pub config: Option<String>,
    #[options(help = "wall-clock speed multiplier, 0 = uncapped")]
    pub speed: Option<u32>,
    #[options(help = "host window scale")]
    pub scale: Option<u32>,
    #[options(help = "tick granularity: fast|normal|precision")]
    pub tick_mode: Option<String>,
    #[options(count, help = "increase log verbosity, may be repeated")]
    pub verbose: u32,
    #[options(count, help = "decrease log verbosity, may be repeated")]
    pub quiet: u32,
}

#[derive(Options, Debug)]
pub struct InfoOptions {
    #[options(help = "print this help message")]
    pub help: bool,
    #[options(free, help = "path to the rom file")]
    pub rom: String,
}

#[derive(Options, Debug)]
pub struct ConfigOptions {
    #[options(help = "print this help message")]
    pub help: bool,
    #[options(help = "path to the config file, overrides the default location")]
    pub config: Option<String>,
    #[options(command)]
    pub command: Option<ConfigCommand>,
}

#[derive(Options, Debug)]
pub enum ConfigCommand {
    #[options(help = "print the value of a key")]
    Get(ConfigKeyOptions),
    #[options(help = "set the value of a key")]
    Set(ConfigSetOptions),
    #[options(help = "list every recognized key and its current value")]
    List(ConfigListOptions),
    #[options(help = "reset a key (or the whole file) to its default")]
    Reset(ConfigKeyOptions),
}

#[derive(Options, Debug)]
pub struct ConfigKeyOptions {
    #[options(help = "print this help message")]
    pub help: bool,
    #[options(free, help = "dotted key, e.g. emulator.speed")]
    pub key: Option<String>,
}

#[derive(Options, Debug)]
pub struct ConfigSetOptions {
    #[options(help = "print this help message")]
    pub help: bool,
    #[options(free, help = "dotted key, e.g. emulator.speed")]
    pub key: String,
    #[options(free, help = "new value")]
    pub value: String,
}

#[derive(Options, Debug)]
pub struct ConfigListOptions {
    #[options(help = "print this help message")]
    pub help: bool,
}
