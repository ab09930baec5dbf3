use std::f64::consts::PI;

use hydrogenic::{
    angular, logger, physics, radial, variables, AngularBasis, AtomParams, Bindings, Coordinates,
    Expr, Orbital, QuantumNumbers,
};
use log::{error, info, warn};

const USAGE: &str = "usage: hydrogenic [n l m] [--basis complex|real|imag] [--latex | --json] \
[--params FILE] [--set NAME=VALUE]... [--norm]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Latex,
    Json,
}

struct Options {
    quantum: Option<(u32, u32, i32)>,
    basis: AngularBasis,
    format: OutputFormat,
    params: AtomParams,
    norm: bool,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Options, String> {
    let mut positional = Vec::new();
    let mut options = Options {
        quantum: None,
        basis: AngularBasis::Complex,
        format: OutputFormat::Text,
        params: AtomParams::default(),
        norm: false,
    };
    let mut assignments = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--latex" => options.format = OutputFormat::Latex,
            "--json" => options.format = OutputFormat::Json,
            "--norm" => options.norm = true,
            "--basis" => {
                let value = args.next().ok_or("--basis needs a value")?;
                options.basis = AngularBasis::from_query(Some(&value));
            }
            "--params" => {
                let path = args.next().ok_or("--params needs a file")?;
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| format!("read {path}: {e}"))?;
                options.params = AtomParams::from_json(&text).map_err(|e| e.to_string())?;
            }
            "--set" => assignments.push(args.next().ok_or("--set needs NAME=VALUE")?),
            "-h" | "--help" => return Err(String::new()),
            other if other.starts_with("--") => return Err(format!("unknown option {other}")),
            other => positional.push(other.to_string()),
        }
    }
    // overrides apply after any parameter file
    for assignment in &assignments {
        options.params.apply_assignment(assignment).map_err(|e| e.to_string())?;
    }

    match positional.as_slice() {
        [] => {}
        [n, l, m] => {
            let n = n.parse().map_err(|e| format!("n: {e}"))?;
            let l = l.parse().map_err(|e| format!("l: {e}"))?;
            let m = m.parse().map_err(|e| format!("m: {e}"))?;
            options.quantum = Some((n, l, m));
        }
        _ => return Err("expected three quantum numbers n l m".to_string()),
    }
    Ok(options)
}

fn print_orbital(orbital: &Orbital, format: OutputFormat) -> hydrogenic::Result<()> {
    let QuantumNumbers { n, l, m_l } = orbital.quantum_numbers;
    let rows = [
        (format!("R({n}, {l})"), &orbital.radial),
        (format!("S({l}, {m_l})"), &orbital.polar),
        (format!("T({m_l})"), &orbital.azimuthal),
        (format!("Y({l}, {m_l})"), &orbital.harmonic),
        (format!("psi({n}, {l}, {m_l})"), &orbital.wavefunction),
    ];
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(orbital)?),
        OutputFormat::Text => {
            for (name, expr) in rows {
                println!("{name} = {expr}");
            }
        }
        OutputFormat::Latex => {
            for (name, expr) in rows {
                println!("{name} = {}", expr.to_latex());
            }
        }
    }
    Ok(())
}

/// Evaluates a handful of formulas at Z = a0 = 1 and prints them next to the values
/// the formulas are known to produce.
fn print_reference_table() -> hydrogenic::Result<()> {
    let params = AtomParams::atomic_units();
    let quarter = Expr::pi() / Expr::from(4);
    let none = Bindings::new();

    let t0 = angular::azimuthal_part(0, &quarter).eval(&none)?;
    println!("T(0, pi/4) = {:.6} + {:.6} i", t0.re, t0.im);
    println!(
        "TReal(1, pi/4) = {:.6}",
        angular::azimuthal_part_real(1, &quarter).eval_real(&none)?
    );
    println!(
        "TImag(1, pi/4) = {:.6}",
        angular::azimuthal_part_imag(1, &quarter).eval_real(&none)?
    );
    println!(
        "S(2, 1, pi/4) = {:.6}",
        angular::polar_part(2, 1, &quarter)?.eval_real(&none)?
    );
    println!(
        "R(3, 2, 1.5) = {:.6}",
        radial::radial_wavefunction(3, 2, &params, &Expr::rational(3, 2))?.eval_real(&none)?
    );

    let harmonic = angular::spherical_harmonic_imag(
        3,
        1,
        &variables::theta().to_expr(),
        &variables::phi().to_expr(),
    )?;
    let at = Bindings::new()
        .with(variables::theta(), PI / 4.)
        .with(variables::phi(), PI / 6.);
    println!("YImag(3, 1, pi/4, pi/6) = {:.6}", harmonic.eval_real(&at)?);

    let qn = QuantumNumbers::new(3, 2, -2)?;
    let coords = Coordinates::new(
        Expr::rational(3, 2),
        Expr::pi() / Expr::from(5),
        Expr::pi() / Expr::from(7),
    );
    println!(
        "psiReal(3, 2, -2, 1.5, pi/5, pi/7) = {:.6}",
        physics::wavefunction_real(qn, &params, &coords)?.eval_real(&none)?
    );

    println!();
    println!("Should be:");
    println!("T(0, pi/4) = 0.398942 + 0.000000 i");
    println!("TReal(1, pi/4) = 0.282095");
    println!("TImag(1, pi/4) = 0.282095");
    println!("S(2, 1, pi/4) = 0.968246");
    println!("R(3, 2, 1.5) = 0.012304");
    println!("YImag(3, 1, pi/4, pi/6) = 0.171392");
    println!("psiReal(3, 2, -2, 1.5, pi/5, pi/7) = 0.001024");
    Ok(())
}

fn run(options: &Options) -> hydrogenic::Result<()> {
    let (n, l, m) = match options.quantum {
        Some(quantum) => quantum,
        None => {
            info!("no quantum numbers given, printing reference values");
            return print_reference_table();
        }
    };
    let qn = QuantumNumbers::new(n, l, m)?;
    let orbital = Orbital::generate(qn, &options.params, &Coordinates::default(), options.basis)?;
    print_orbital(&orbital, options.format)?;

    if options.norm {
        let norm = radial::radial_norm(n, l, &options.params)?;
        if !norm.is_one() {
            warn!("normalization integral is {norm}, expected 1");
        }
        println!("int_0^inf R({n}, {l})^2 r^2 dr = {norm}");
    }
    Ok(())
}

fn main() {
    if let Err(e) = logger::init() {
        eprintln!("logger: {e}");
    }

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("{message}");
            }
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&options) {
        error!("{e}");
        std::process::exit(1);
    }
}
