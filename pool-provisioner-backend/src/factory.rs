//! Backend factory functions.

use std::sync::Arc;

use crate::backends::TransportOptions;
use crate::error::Result;
use crate::traits::PoolBackend;
use crate::types::BackendCredentials;

#[cfg(feature = "cpa")]
use crate::backends::CpaBackend;
#[cfg(feature = "crs")]
use crate::backends::CrsBackend;
#[cfg(feature = "s2a")]
use crate::backends::S2aBackend;
#[cfg(feature = "sub2api")]
use crate::backends::Sub2apiBackend;

/// Creates a [`PoolBackend`] instance from the given credentials.
///
/// The concrete backend type is determined by the [`BackendCredentials`]
/// variant. The returned backend is wrapped in `Arc<dyn PoolBackend>` for
/// easy sharing across async tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use pool_provisioner_backend::{BackendCredentials, TransportOptions, create_backend};
///
/// let backend = create_backend(
///     BackendCredentials::Crs {
///         api_base: "https://crs.example.com".to_string(),
///         admin_token: "your-token".to_string(),
///     },
///     &TransportOptions::default(),
/// ).unwrap();
/// ```
pub fn create_backend(
    credentials: BackendCredentials,
    transport: &TransportOptions,
) -> Result<Arc<dyn PoolBackend>> {
    match credentials {
        #[cfg(feature = "crs")]
        BackendCredentials::Crs {
            api_base,
            admin_token,
        } => Ok(Arc::new(CrsBackend::new(api_base, admin_token, transport))),
        #[cfg(feature = "cpa")]
        BackendCredentials::Cpa {
            api_base,
            admin_password,
            is_webui,
            poll_interval_secs,
            poll_max_retries,
        } => Ok(Arc::new(CpaBackend::new(
            api_base,
            admin_password,
            is_webui,
            poll_interval_secs,
            poll_max_retries,
            transport,
        ))),
        #[cfg(feature = "s2a")]
        BackendCredentials::S2a {
            api_base,
            admin_key,
            admin_token,
            concurrency,
            priority,
            group_ids,
            group_names,
        } => Ok(Arc::new(S2aBackend::new(
            api_base,
            admin_key,
            admin_token,
            concurrency,
            priority,
            group_ids,
            group_names,
            transport,
        ))),
        #[cfg(feature = "sub2api")]
        BackendCredentials::Sub2api {
            api_base,
            admin_api_key,
            admin_jwt,
            concurrency,
            priority,
            group_ids,
            proxy_id,
        } => Ok(Arc::new(Sub2apiBackend::new(
            api_base,
            admin_api_key,
            admin_jwt,
            concurrency,
            priority,
            group_ids,
            proxy_id,
            transport,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuthProtocol;

    #[test]
    fn factory_selects_protocol_by_variant() {
        let transport = TransportOptions::default();

        let crs = create_backend(
            BackendCredentials::Crs {
                api_base: "https://crs.example.com".into(),
                admin_token: "t".into(),
            },
            &transport,
        )
        .unwrap();
        assert_eq!(crs.id(), "crs");
        assert_eq!(crs.protocol(), AuthProtocol::CodeExchange);

        let cpa = create_backend(
            BackendCredentials::Cpa {
                api_base: "https://cpa.example.com".into(),
                admin_password: "pw".into(),
                is_webui: true,
                poll_interval_secs: 3,
                poll_max_retries: 20,
            },
            &transport,
        )
        .unwrap();
        assert_eq!(cpa.id(), "cpa");
        assert_eq!(cpa.protocol(), AuthProtocol::CallbackPoll);

        let s2a = create_backend(
            BackendCredentials::S2a {
                api_base: "https://s2a.example.com".into(),
                admin_key: "k".into(),
                admin_token: String::new(),
                concurrency: 10,
                priority: 50,
                group_ids: vec![],
                group_names: vec![],
            },
            &transport,
        )
        .unwrap();
        assert_eq!(s2a.id(), "s2a");
        assert_eq!(s2a.protocol(), AuthProtocol::CombinedCreate);

        let sub2api = create_backend(
            BackendCredentials::Sub2api {
                api_base: "https://sub2api.example.com/".into(),
                admin_api_key: "k".into(),
                admin_jwt: String::new(),
                concurrency: 10,
                priority: 50,
                group_ids: vec![],
                proxy_id: None,
            },
            &transport,
        )
        .unwrap();
        assert_eq!(sub2api.id(), "sub2api");
        assert_eq!(sub2api.protocol(), AuthProtocol::CombinedCreate);
    }
}
