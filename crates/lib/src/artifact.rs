//! The build artifact and its upload to object storage.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{DeployError, RemoteResultExt};
use crate::remote::ObjectStore;

/// A validated local artifact and the storage key it is uploaded under.
///
/// The key is the file's base name: no prefix, no hash, no version. Uploading
/// two files with the same name overwrites the earlier object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReference {
  path: PathBuf,
  key: String,
}

impl ArtifactReference {
  /// Validate `path` and derive its key.
  ///
  /// # Errors
  ///
  /// `DeployError::Validation` if `path` is not an existing regular file.
  pub fn new(path: impl Into<PathBuf>) -> Result<Self, DeployError> {
    let path = path.into();
    if !path.is_file() {
      return Err(DeployError::Validation(format!(
        "cannot find artifact file to upload: {}",
        path.display()
      )));
    }

    let key = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .ok_or_else(|| DeployError::Validation(format!("artifact path has no file name: {}", path.display())))?;

    Ok(Self { path, key })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn key(&self) -> &str {
    &self.key
  }
}

/// Upload `artifact` to `bucket` and return the key it was stored under.
pub async fn upload_artifact<O: ObjectStore>(
  store: &O,
  bucket: &str,
  artifact: &ArtifactReference,
) -> Result<String, DeployError> {
  info!(bucket = %bucket, key = %artifact.key(), "uploading artifact");
  store
    .put_object(bucket, artifact.key(), artifact.path())
    .await
    .or_remote("could not upload file to S3")?;
  Ok(artifact.key().to_string())
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;
  use crate::error::ErrorKind;
  use crate::remote::RemoteErrorKind;
  use crate::util::testutil::{Call, FakeBackend};

  #[test]
  fn key_is_base_name() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("build").join("dist");
    fs::create_dir_all(&nested).unwrap();
    let file = nested.join("app-1.0.zip");
    fs::write(&file, b"zip").unwrap();

    let artifact = ArtifactReference::new(&file).unwrap();
    assert_eq!(artifact.key(), "app-1.0.zip");
    assert_eq!(artifact.path(), file);
  }

  #[test]
  fn missing_file_is_validation_error() {
    let temp = TempDir::new().unwrap();
    let err = ArtifactReference::new(temp.path().join("missing.zip")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("cannot find artifact file"));
  }

  #[test]
  fn directory_is_validation_error() {
    let temp = TempDir::new().unwrap();
    let err = ArtifactReference::new(temp.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
  }

  #[tokio::test]
  async fn upload_puts_one_object() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("app.zip");
    fs::write(&file, b"zip").unwrap();
    let artifact = ArtifactReference::new(&file).unwrap();

    let backend = FakeBackend::new();
    let key = upload_artifact(&backend, "my-bucket", &artifact).await.unwrap();

    assert_eq!(key, "app.zip");
    assert_eq!(
      backend.calls(),
      vec![Call::PutObject {
        bucket: "my-bucket".into(),
        key: "app.zip".into()
      }]
    );
    assert_eq!(backend.uploads()[0].2, file);
  }

  #[tokio::test]
  async fn upload_failures_are_classified() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("app.zip");
    fs::write(&file, b"zip").unwrap();
    let artifact = ArtifactReference::new(&file).unwrap();

    let backend = FakeBackend::new().fail_upload(RemoteErrorKind::Service);
    let err = upload_artifact(&backend, "my-bucket", &artifact).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteService);
    assert!(err.to_string().starts_with("[SERVICE] could not upload file to S3"));

    let backend = FakeBackend::new().fail_upload(RemoteErrorKind::Client);
    let err = upload_artifact(&backend, "my-bucket", &artifact).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteClient);
  }
}
