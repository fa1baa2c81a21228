use kickoff_build::dockerfile::DockerfileGenerator;
use kickoff_core::KickoffConfig;

pub async fn dockerfile(config: &KickoffConfig) -> anyhow::Result<()> {
    let generator = DockerfileGenerator::new(&config.build, &config.server, super::BINARY_NAME);
    print!("{}", generator.render());
    Ok(())
}
