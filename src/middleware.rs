// src/middleware.rs

pub mod sesion;
