use std::path::PathBuf;

/// Dumps the parsed AST of a program.
pub fn main(input: PathBuf, pretty: bool) -> anyhow::Result<()> {
    let (_, ast) = super::load_and_parse(&input, pretty)?;
    println!("{:#?}", ast);
    Ok(())
}
