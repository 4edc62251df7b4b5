use anyhow::Result;
use calmanage_core::Dispatcher;

pub fn run(dispatcher: &Dispatcher) -> Result<()> {
    println!("{}", dispatcher.registry().listing());
    Ok(())
}
