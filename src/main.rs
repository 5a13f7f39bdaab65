use structopt::StructOpt;
use satrail::logger::Logger;

mod app;

fn main() {
    let options = app::Options::from_args();

    if let Err(err) = Logger::init(options.log_filter, options.mute.iter().cloned()) {
        eprintln!("unable to initialize logging system: {}", err);
    }

    let result = app::App::new(&options)
        .and_then(|mut app| app.run(options.ticks, options.tick));

    if let Err(err) = result {
        eprintln!("{}: {}", app::APP_NAME, err);
        std::process::exit(1);
    }
}
