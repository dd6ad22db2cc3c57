use log::error;

fn main() {
    env_logger::init();

    if let Err(e) = ais_features::get_arg().and_then(ais_features::run) {
        error!("{e:#}");
        std::process::exit(-1);
    }
}
