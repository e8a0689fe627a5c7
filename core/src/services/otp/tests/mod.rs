//! Unit tests for the OTP lifecycle manager

mod mocks;
