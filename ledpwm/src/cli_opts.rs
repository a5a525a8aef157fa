use gumdrop::Options;
use ledpwm_cycle::StartupRequest;

#[derive(Debug, Default, Options)]
pub struct CliStart {
    #[options(help_flag, help = "print help message")]
    pub help: bool,
    #[options(short = "V", help = "show program version number")]
    pub version: bool,
    #[options(meta = "NUM", help = "LED to control <1-32, all> (required)")]
    pub led: Option<String>,
    #[options(meta = "PCT", help = "Brightness level <1-100>, not with --fade")]
    pub brightness: Option<f64>,
    #[options(help = "Fade the LED in and out, not with --brightness")]
    pub fade: bool,
    #[options(meta = "NAME", help = "only drive LEDs of this input device, e.g. input3")]
    pub input: Option<String>,
    #[options(meta = "US", help = "PWM period in microseconds")]
    pub period: Option<u64>,
    #[options(
        no_short,
        meta = "HZ",
        help = "nominal frequency, sets the fade speed and default period"
    )]
    pub frequency: Option<f64>,
    #[options(help = "busy-wait between writes for finer timing, uses a full core")]
    pub spin: bool,
    #[options(no_short, help = "give the LED back to its kernel trigger on exit")]
    pub restore_trigger: bool,
    #[options(help = "log what would be written instead of touching the LED")]
    pub dry_run: bool,
    #[options(help = "debug logging")]
    pub verbose: bool,
}

impl CliStart {
    pub fn startup_request(&self) -> StartupRequest {
        StartupRequest {
            indicator: self.led.clone(),
            brightness: self.brightness,
            fade: self.fade,
        }
    }
}
