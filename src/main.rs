use env_logger::Env;
use fuzzy_machine::core::{
    error::{map_internal_err, CustomError},
    fuzzy::{apply_inputs, create_inference_machine, parse_input},
    settings::load_preset,
    DEFAULT_PRESET, PRESET_ENV, WORKERS_ENV,
};

fn run() -> Result<(), CustomError> {
    dotenvy::dotenv().ok();

    let path = dotenvy::var(PRESET_ENV).unwrap_or_else(|_| DEFAULT_PRESET.to_string());
    let workers = match dotenvy::var(WORKERS_ENV) {
        Ok(raw) => Some(raw.trim().parse::<usize>().map_err(map_internal_err)?),
        Err(_) => None,
    };

    log::info!("loading preset {}", path);
    let preset = load_preset(&path)?;
    let mut machine = create_inference_machine(&preset, workers)?;

    let inputs = std::env::args()
        .skip(1)
        .map(|raw| parse_input(&raw))
        .collect::<Result<Vec<_>, _>>()?;

    match apply_inputs(&mut machine, &inputs)? {
        Some(decision) => println!("{}", decision),
        None => println!("no decision"),
    }
    Ok(())
}

fn main() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
