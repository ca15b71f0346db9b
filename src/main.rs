use std::io::{self, Write};

use storyline::demo::purchase_story;
use storyline::{kwargs, AppError, Presenter};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .with_writer(io::stderr)
                             .init();

    let presenter = Presenter::from_env();
    let story = purchase_story(25, 3)?;
    let mut out = io::stdout().lock();

    for (item, quantity) in [("pencil", 4), ("notebook", 12), ("eraser", 40)] {
        log::info!("demo:purchase item={item} quantity={quantity}");
        let execution = story.execute(kwargs! { "item" => item, "quantity" => quantity });
        writeln!(out, "{}", presenter.render(&execution))?;
        match execution.into_summary()? {
            storyline::Summary::Success(value) => {
                writeln!(out, "=> {}", value.map(|v| v.to_string()).unwrap_or_else(|| "None".into()))?
            }
            storyline::Summary::Failure(failure) => writeln!(out, "=> {failure}")?,
        }
        writeln!(out)?;
    }
    Ok(())
}
