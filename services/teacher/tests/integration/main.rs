mod helpers;

mod teacher_test;
