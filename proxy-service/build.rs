use std::io::Result;

fn main() -> Result<()> {
    // The schema is owned by fedcall-core; the test server compiles the same file.
    let proto_files = &["../fedcall-core/proto/proxy.proto"];

    let proto_folder = "../fedcall-core/proto";
    tonic_prost_build::configure()
        .build_client(false)
        .compile_protos(proto_files, &[proto_folder])
        .unwrap();

    Ok(())
}
