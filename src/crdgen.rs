use controller::api::v1::Database;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&Database::crd())?);
    Ok(())
}
