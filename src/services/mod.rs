pub mod bootcamp_service;
