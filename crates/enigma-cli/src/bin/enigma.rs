// enigma: Encrypt and decrypt messages with a configured rotor machine.
//
// Reads setting lines (`* ...`) and messages from INPUT, writing each
// converted message in groups of five.
//
// Usage:
//   enigma [--verbose] [CONFIG [INPUT [OUTPUT]]]
//
// Options:
//   -v, --verbose   Trace every keypress on stderr
//   -h, --help      Print help

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if enigma_cli::wants_help(&args) {
        println!("enigma: Encrypt and decrypt messages with a rotor machine.");
        println!();
        println!("Usage: enigma [--verbose] [CONFIG [INPUT [OUTPUT]]]");
        println!();
        println!("CONFIG describes the alphabet, slots, pawls and rotors. If omitted,");
        println!("the path is taken from {}.", enigma_cli::CONFIG_ENV);
        println!("INPUT defaults to stdin and OUTPUT to stdout; '-' also selects them.");
        println!();
        println!("Options:");
        println!("  -v, --verbose   Trace every keypress on stderr (RUST_LOG overrides)");
        println!("  -h, --help      Print this help");
        return;
    }

    let opts = enigma_cli::parse_args(&args, std::env::var(enigma_cli::CONFIG_ENV).ok())
        .unwrap_or_else(|e| enigma_cli::fatal(&e));
    enigma_cli::init_tracing(opts.verbose);

    if let Err(e) = enigma_cli::run(&opts) {
        enigma_cli::fatal(&e);
    }
}
