// Integration tests module

#[cfg(test)]
mod controller_test;
