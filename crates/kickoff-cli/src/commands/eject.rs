use kickoff_build::dockerfile::DockerfileGenerator;
use kickoff_core::KickoffConfig;
use std::path::Path;

pub async fn eject(config: &KickoffConfig, dir: &Path) -> anyhow::Result<()> {
    let generator = DockerfileGenerator::new(&config.build, &config.server, super::BINARY_NAME);
    let dockerfile = generator.render();

    let path = kickoff_build::eject::eject(dir, &dockerfile)?;

    println!("Ejected Dockerfile to {}", path.display());
    println!("Edit it directly; delete it to re-eject.");
    Ok(())
}
