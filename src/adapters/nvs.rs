//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`StoragePort`] for the reset-history ring buffer.  On ESP32 it
//! talks to the default NVS partition; on the host it keeps an in-memory map
//! keyed by `"namespace::key"` so the same history code runs under test.
//!
//! NVS limits namespace and key names to 15 bytes; longer names are rejected
//! with [`StorageError::IoError`] rather than silently truncated.

use log::info;

use crate::app::ports::{StorageError, StoragePort};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::warn;

const MAX_NAME_LEN: usize = 15;

pub struct NvsStore {
    #[cfg(not(target_os = "espidf"))]
    store: HashMap<String, Vec<u8>>,
}

impl NvsStore {
    /// Initialise NVS flash and return the store.
    ///
    /// On first boot or after a layout version change the partition is
    /// erased and re-initialised.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: called once from the main task before any NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(StorageError::IoError);
            }
            info!("NvsStore: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsStore: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: HashMap::new(),
        })
    }

    /// NUL-terminated copy of an NVS name.
    fn c_name(name: &str) -> Result<[u8; MAX_NAME_LEN + 1], StorageError> {
        let bytes = name.as_bytes();
        if bytes.is_empty() || bytes.len() > MAX_NAME_LEN || bytes.contains(&0) {
            return Err(StorageError::IoError);
        }
        let mut buf = [0u8; MAX_NAME_LEN + 1];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(buf)
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> Result<String, StorageError> {
        Self::c_name(namespace)?;
        Self::c_name(key)?;
        Ok(format!("{}::{}", namespace, key))
    }

    /// Open `namespace`, run `f` with the handle and key, then close.
    #[cfg(target_os = "espidf")]
    fn with_handle<T>(
        namespace: &str,
        key: &str,
        write: bool,
        f: impl FnOnce(nvs_handle_t, *const core::ffi::c_char) -> Result<T, esp_err_t>,
    ) -> Result<T, StorageError> {
        let ns = Self::c_name(namespace)?;
        let key = Self::c_name(key)?;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let mut handle: nvs_handle_t = 0;
        // SAFETY: `ns` is NUL-terminated and outlives the call.
        let ret = unsafe { nvs_open(ns.as_ptr().cast(), mode, &mut handle) };
        if ret == ESP_ERR_NVS_NOT_FOUND {
            return Err(StorageError::NotFound);
        }
        if ret != ESP_OK {
            return Err(StorageError::IoError);
        }

        let result = f(handle, key.as_ptr().cast());
        // SAFETY: `handle` was opened above and is not used afterwards.
        unsafe { nvs_close(handle) };

        result.map_err(|e| match e {
            ESP_ERR_NVS_NOT_FOUND => StorageError::NotFound,
            ESP_ERR_NVS_NOT_ENOUGH_SPACE => StorageError::Full,
            ESP_ERR_NVS_INVALID_LENGTH => StorageError::Corrupted,
            _ => StorageError::IoError,
        })
    }
}

impl StoragePort for NvsStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key)?;
            match self.store.get(&composite) {
                Some(data) => {
                    let len = data.len().min(buf.len());
                    buf[..len].copy_from_slice(&data[..len]);
                    Ok(len)
                }
                None => Err(StorageError::NotFound),
            }
        }

        #[cfg(target_os = "espidf")]
        {
            Self::with_handle(namespace, key, false, |handle, key| {
                let mut size = buf.len();
                // SAFETY: `buf` is valid for `size` bytes.
                let ret = unsafe { nvs_get_blob(handle, key, buf.as_mut_ptr().cast(), &mut size) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(size)
            })
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key)?;
            self.store.insert(composite, data.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            Self::with_handle(namespace, key, true, |handle, key| {
                // SAFETY: `data` is valid for `data.len()` bytes.
                let ret = unsafe { nvs_set_blob(handle, key, data.as_ptr().cast(), data.len()) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                match unsafe { nvs_commit(handle) } {
                    ESP_OK => Ok(()),
                    e => Err(e),
                }
            })
        }
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key)?;
            self.store.remove(&composite);
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_handle(namespace, key, true, |handle, key| {
                let ret = unsafe { nvs_erase_key(handle, key) };
                if ret != ESP_OK && ret != ESP_ERR_NVS_NOT_FOUND {
                    return Err(ret);
                }
                match unsafe { nvs_commit(handle) } {
                    ESP_OK => Ok(()),
                    e => Err(e),
                }
            });
            // A namespace that was never written has nothing to delete.
            match result {
                Err(StorageError::NotFound) => Ok(()),
                other => other,
            }
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        #[cfg(not(target_os = "espidf"))]
        {
            Self::composite_key(namespace, key).is_ok_and(|k| self.store.contains_key(&k))
        }

        #[cfg(target_os = "espidf")]
        {
            Self::with_handle(namespace, key, false, |handle, key| {
                let mut size = 0usize;
                let ret = unsafe { nvs_get_blob(handle, key, core::ptr::null_mut(), &mut size) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            })
            .is_ok()
        }
    }
}
