use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Build metadata shown by `modlock versions`; missing git falls back to defaults.
    vergen_gitcl::Emitter::default()
        .add_instructions(
            &vergen_gitcl::GitclBuilder::default()
                .sha(true)
                .dirty(true)
                .build()?,
        )?
        .add_instructions(&vergen_gitcl::RustcBuilder::default().semver(true).build()?)?
        .emit()?;
    Ok(())
}
