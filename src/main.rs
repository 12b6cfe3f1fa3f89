use std::io::Write;

use bankist::account::AccountStore;
use bankist::clock::SystemClock;
use bankist::command::Intent;
use bankist::config::EngineConfig;
use bankist::dashboard::Dashboard;
use bankist::render::TextSink;
use color_eyre::eyre::OptionExt as _;
use csv::ReaderBuilder;
use csv::Trim;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    bankist::logging::init_tracing();

    let script_path = std::env::args().nth(1).ok_or_eyre("no intent script supplied")?;
    let mut script_reader = ReaderBuilder::new().trim(Trim::All).from_path(script_path)?;

    let store = AccountStore::new(bankist::seed::seed_accounts()?);
    let mut dashboard = Dashboard::new(EngineConfig::default(), store, TextSink::new(SystemClock), SystemClock);

    let mut stdout = std::io::stdout().lock();
    write_lines(&mut stdout, dashboard.sink_mut().drain())?;

    for (row, intent_res) in script_reader.deserialize::<Intent>().enumerate() {
        let intent = match intent_res {
            Ok(intent) => intent,
            Err(error) => {
                tracing::warn!(row, %error, "failed to deserialize intent");
                continue;
            }
        };

        writeln!(stdout, "> {}", intent.name())?;
        if let Err(error) = dashboard.dispatch(intent) {
            tracing::warn!(row, %error, "intent not applied");
            writeln!(stdout, "! {error}")?;
        }
        write_lines(&mut stdout, dashboard.sink_mut().drain())?;
    }

    stdout.flush()?;
    Ok(())
}

fn write_lines(out: &mut impl Write, lines: Vec<String>) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
