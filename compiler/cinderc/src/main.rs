//! Cinder command-line runner.

use std::io::IsTerminal;
use std::process::ExitCode;

use cinderc::{ColorMode, Machine, Scope, TerminalEmitter, Value, VmConfig};

struct Options {
    path: String,
    config: VmConfig,
    steps_per_tick: usize,
}

fn print_usage() {
    eprintln!("Usage: cinder <file> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!(
        "  --stack-size <n>      Operand stack capacity (default: {})",
        VmConfig::DEFAULT_STACK_SIZE
    );
    eprintln!(
        "  --call-depth <n>      Maximum call depth (default: {})",
        VmConfig::DEFAULT_CALL_STACK_SIZE
    );
    eprintln!("  --steps-per-tick <n>  Instructions executed per host tick (default: 1000)");
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=cinder_vm=trace) for execution logs.");
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut path = None;
    let mut config = VmConfig::default();
    let mut steps_per_tick = 1000;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if let Some(flag) = arg.strip_prefix("--") {
            let value = args
                .get(i + 1)
                .ok_or_else(|| format!("missing value for `--{flag}`"))?;
            let n: usize = value
                .parse()
                .map_err(|_| format!("`--{flag}` expects a number, got `{value}`"))?;
            match flag {
                "stack-size" => config = config.with_stack_size(n),
                "call-depth" => config = config.with_call_stack_size(n),
                "steps-per-tick" => steps_per_tick = n,
                _ => return Err(format!("unknown option `--{flag}`")),
            }
            i += 2;
        } else if path.is_none() {
            path = Some(arg.clone());
            i += 1;
        } else {
            return Err(format!("unexpected argument `{arg}`"));
        }
    }

    let path = path.ok_or_else(|| "missing file path".to_owned())?;
    Ok(Options {
        path,
        config,
        steps_per_tick,
    })
}

fn host_builtins() -> Scope {
    let scope = Scope::new();
    // A new scope is writable, so registration cannot fail.
    let _ = scope.define_builtin("print", None, |_: &mut dyn Machine, args| {
        let line: Vec<String> = args.iter().map(Value::display_value).collect();
        println!("{}", line.join(" "));
        Ok(())
    });
    scope.freeze();
    scope
}

fn main() -> ExitCode {
    cinderc::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        return ExitCode::FAILURE;
    }
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let text = match std::fs::read_to_string(&options.path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: cannot read '{}': {e}", options.path);
            return ExitCode::FAILURE;
        }
    };

    let builtins = host_builtins();
    let script = match cinderc::compile_named(&options.path, &text, &builtins) {
        Ok(script) => script,
        Err(error) => {
            let is_tty = std::io::stderr().is_terminal();
            let mut emitter = TerminalEmitter::stderr(ColorMode::Auto, is_tty);
            if emitter.emit(&error).is_err() {
                eprintln!("{error}");
            }
            return ExitCode::FAILURE;
        }
    };

    match cinderc::run_to_completion(&script, options.config, options.steps_per_tick) {
        Ok(values) => {
            for value in &values {
                println!("{}", value.display_value());
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
