//! Cross-crate scenarios: enrollment through relay.

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod enrollment;

#[cfg(test)]
mod relay;
