use crate::config::Credentials;
use serde::Serialize;
use thiserror::Error;

const FORMAT_JSON: &str = "json";

#[derive(Error, Debug)]
pub enum SignerError {
    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// The four form fields carried by every request.
///
/// Fields are declared in key order so query strings and form bodies come
/// out sorted, the same way the API's reference clients encode them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormValues {
    pub api_key: String,
    pub format: &'static str,
    pub json: String,
    pub sig: String,
}

#[derive(Clone)]
pub struct Signer {
    credentials: Credentials,
}

impl Signer {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// `md5(secret + sorted([api_key, "json", params]).concat())` as lowercase hex.
    ///
    /// MD5 is what the remote API verifies against and must not change.
    pub fn signature(&self, params: &str) -> String {
        let mut values = [self.credentials.api_key(), FORMAT_JSON, params];
        values.sort_unstable();

        let mut data = String::with_capacity(
            self.credentials.secret().len() + values.iter().map(|v| v.len()).sum::<usize>(),
        );
        data.push_str(self.credentials.secret());
        for value in values {
            data.push_str(value);
        }

        format!("{:x}", md5::compute(data.as_bytes()))
    }

    /// Serialize `payload` and sign exactly the text that will be sent.
    pub fn encode<P>(&self, payload: &P) -> Result<FormValues, SignerError>
    where
        P: Serialize + ?Sized,
    {
        let params = serde_json::to_string(payload)?;
        let sig = self.signature(&params);

        Ok(FormValues {
            api_key: self.credentials.api_key().to_string(),
            format: FORMAT_JSON,
            json: params,
            sig,
        })
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("credentials", &self.credentials)
            .finish()
    }
}
