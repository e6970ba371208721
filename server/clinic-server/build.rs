fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/clinic/v1/clinic.proto");

    #[cfg(feature = "grpc")]
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile(&["proto/clinic/v1/clinic.proto"], &["proto/"])?;

    Ok(())
}
