pub mod damage_estimate;
