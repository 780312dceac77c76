mod aws_adapter_tests;
