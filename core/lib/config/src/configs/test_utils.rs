use std::{
    collections::HashMap,
    env,
    ffi::{OsStr, OsString},
    mem,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Serializes tests that modify env variables. Modified variables are restored
/// when the [`EnvMutexGuard`] is dropped.
#[derive(Debug)]
pub(crate) struct EnvMutex(Mutex<()>);

impl EnvMutex {
    pub const fn new() -> Self {
        Self(Mutex::new(()))
    }

    pub fn lock(&self) -> EnvMutexGuard<'_> {
        let guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        EnvMutexGuard {
            _inner: guard,
            original_values: HashMap::new(),
        }
    }
}

#[must_use = "Environment will be reset when the guard is dropped"]
#[derive(Debug)]
pub(crate) struct EnvMutexGuard<'a> {
    _inner: MutexGuard<'a, ()>,
    original_values: HashMap<OsString, Option<OsString>>,
}

impl Drop for EnvMutexGuard<'_> {
    fn drop(&mut self) {
        for (name, value) in mem::take(&mut self.original_values) {
            match value {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }
    }
}

impl EnvMutexGuard<'_> {
    fn remember(&mut self, name: &OsStr) {
        self.original_values
            .entry(name.to_os_string())
            .or_insert_with(|| env::var_os(name));
    }

    /// Sets env vars specified in `.env`-like format. Values may be quoted.
    pub fn set_env(&mut self, fixture: &str) {
        for line in fixture.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let (name, value) = line
                .split_once('=')
                .unwrap_or_else(|| panic!("Incorrect line for setting environment variable: {line}"));
            let name: &OsStr = name.as_ref();
            self.remember(name);
            env::set_var(name, value.trim_matches('"'));
        }
    }

    pub fn remove_env(&mut self, names: &[&str]) {
        for &name in names {
            let name: &OsStr = name.as_ref();
            self.remember(name);
            env::remove_var(name);
        }
    }
}

#[test]
fn env_mutex_restores_variables() {
    const UNSET_VARIABLE: &str = "ZKSYNC_TEST_VARIABLE_THAT_WILL_CERTAINLY_NOT_BE_SET";
    const REDEFINED_VARIABLE: &str = "ZKSYNC_REDEFINED_VARIABLE_THAT_WILL_CERTAINLY_NOT_BE_SET";

    assert!(env::var_os(UNSET_VARIABLE).is_none());
    env::set_var(REDEFINED_VARIABLE, "initial");

    let mutex = EnvMutex::new();
    let mut lock = mutex.lock();
    lock.set_env(&format!("{UNSET_VARIABLE}=test\n{REDEFINED_VARIABLE}=\"redefined\""));
    assert_eq!(env::var_os(UNSET_VARIABLE).unwrap(), "test");
    assert_eq!(env::var_os(REDEFINED_VARIABLE).unwrap(), "redefined");
    lock.remove_env(&[REDEFINED_VARIABLE]);
    assert!(env::var_os(REDEFINED_VARIABLE).is_none());

    drop(lock);
    assert!(env::var_os(UNSET_VARIABLE).is_none());
    assert_eq!(env::var_os(REDEFINED_VARIABLE).unwrap(), "initial");
}
