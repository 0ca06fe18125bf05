//! Build script for compiling protobuf definitions.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &["../../proto/user_service.proto", "../../proto/health.proto"],
            &["../../proto"],
        )?;

    println!("cargo:rerun-if-changed=../../proto/");

    Ok(())
}
