use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::AeternityHelperError;

/// File extension of Sophia contract sources.
pub const CONTRACT_EXTENSION: &str = "aes";

// Define a trait for file reading
pub trait FileReader: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String, AeternityHelperError>;
}

pub struct DefaultFileReader;

impl FileReader for DefaultFileReader {
    fn read_to_string(&self, path: &Path) -> Result<String, AeternityHelperError> {
        // keep the kind so NotFound still maps to ContractNotFound
        let bytes = fs::read(path)
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;

        String::from_utf8(bytes).map_err(|e| {
            AeternityHelperError::FileReadError(format!(
                "{} is not valid UTF-8: {}",
                path.display(),
                e
            ))
        })
    }
}

/// Source text of a contract, tagged with its logical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSource {
    pub name: String,
    pub code: String,
}

/// Resolves logical contract names to `<contracts_dir>/<name>.aes` and reads them.
pub struct ContractLoader {
    contracts_dir: PathBuf,
    reader: Box<dyn FileReader>,
}

impl ContractLoader {
    pub fn new(contracts_dir: impl Into<PathBuf>) -> Self {
        Self::with_reader(contracts_dir, Box::new(DefaultFileReader))
    }

    pub fn with_reader(contracts_dir: impl Into<PathBuf>, reader: Box<dyn FileReader>) -> Self {
        Self {
            contracts_dir: contracts_dir.into(),
            reader,
        }
    }

    pub fn contracts_dir(&self) -> &Path {
        &self.contracts_dir
    }

    pub fn path_for(&self, name: &str) -> Result<PathBuf, AeternityHelperError> {
        if name.is_empty() || name.contains(&['/', '\\'][..]) || name == ".." {
            return Err(AeternityHelperError::InvalidArgument(format!(
                "Invalid contract name '{}'",
                name
            )));
        }
        Ok(self
            .contracts_dir
            .join(format!("{}.{}", name, CONTRACT_EXTENSION)))
    }

    pub fn load(&self, name: &str) -> Result<ContractSource, AeternityHelperError> {
        let path = self.path_for(name)?;
        let code = self.reader.read_to_string(&path)?;
        debug!(contract = name, path = %path.display(), bytes = code.len(), "loaded contract source");
        Ok(ContractSource {
            name: name.to_string(),
            code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockFileReader;
    use std::io::Write;
    use tempfile::TempDir;

    const SOURCE: &str = "contract Frac =\n  public function test() : int = 42\n";

    #[test]
    fn test_load_existing_contract() {
        let dir = TempDir::new().unwrap();
        let mut file = fs::File::create(dir.path().join("Frac.aes")).unwrap();
        file.write_all(SOURCE.as_bytes()).unwrap();

        let loader = ContractLoader::new(dir.path());
        let source = loader.load("Frac").unwrap();

        assert_eq!(source.name, "Frac");
        assert_eq!(source.code, SOURCE);
    }

    #[test]
    fn test_missing_contract() {
        let dir = TempDir::new().unwrap();
        let loader = ContractLoader::new(dir.path());

        let res = loader.load("Missing");
        assert!(matches!(res, Err(AeternityHelperError::ContractNotFound(msg)) if msg.contains("Missing.aes")));
    }

    #[test]
    fn test_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Binary.aes"), [0xff, 0xfe, 0x00]).unwrap();

        let loader = ContractLoader::new(dir.path());
        let res = loader.load("Binary");
        assert!(matches!(res, Err(AeternityHelperError::FileReadError(msg)) if msg.contains("UTF-8")));
    }

    #[test]
    fn test_directory_is_not_a_contract() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Nested.aes")).unwrap();

        let loader = ContractLoader::new(dir.path());
        let res = loader.load("Nested");
        assert!(matches!(
            res,
            Err(AeternityHelperError::FileReadError(msg))
                if msg.starts_with("File operation failed") && msg.contains("Nested.aes")
        ));
    }

    #[test]
    fn test_rejects_path_like_names() {
        let loader = ContractLoader::new("./contracts");
        for name in ["", "../Frac", "sub/Frac", ".."] {
            assert!(matches!(
                loader.path_for(name),
                Err(AeternityHelperError::InvalidArgument(_))
            ));
        }
        assert_eq!(
            loader.path_for("Frac").unwrap(),
            Path::new("./contracts").join("Frac.aes")
        );
    }

    #[test]
    fn test_custom_reader() {
        let loader = ContractLoader::with_reader(
            "./contracts",
            Box::new(MockFileReader::new(Ok(SOURCE.to_string()))),
        );
        assert_eq!(loader.load("Frac").unwrap().code, SOURCE);

        let failing = ContractLoader::with_reader(
            "./contracts",
            Box::new(MockFileReader::new(Err(AeternityHelperError::FileReadError(
                "corrupt".to_string(),
            )))),
        );
        assert!(failing.load("Frac").is_err());
    }
}
