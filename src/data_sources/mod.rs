pub mod backend;
pub mod dummy;
pub mod subscription;
pub mod supabase;
