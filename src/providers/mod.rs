pub mod google_domains;
