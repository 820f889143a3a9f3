pub mod backend;
pub mod frontend;
pub mod supabase;
